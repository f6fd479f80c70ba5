pub mod invoices;
pub mod orders;
pub mod products;
pub mod users;
pub mod vendors;
