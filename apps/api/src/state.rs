//! Shared application state handed to every handler.

use stockroom_db::Database;

use crate::services::{
    category::CategoryService, notification::NotificationService, order::OrderService,
    product::ProductService, report::ReportService, supplier::SupplierService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub notifier: NotificationService,
}

impl AppState {
    pub fn new(db: Database, notifier: NotificationService) -> Self {
        AppState { db, notifier }
    }

    pub fn categories(&self) -> CategoryService {
        CategoryService::new(self.db.clone())
    }

    pub fn suppliers(&self) -> SupplierService {
        SupplierService::new(self.db.clone())
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(self.db.clone(), self.notifier.clone())
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.db.clone(), self.notifier.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.db.clone())
    }
}
