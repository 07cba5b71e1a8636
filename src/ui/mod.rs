pub mod icons;
pub mod notice;
pub mod spinner;
pub mod table;

pub use notice::{format_notification, print_all, print_notification};
pub use spinner::loading;
pub use table::{Table, customers_table, order_details, orders_table, services_table};
