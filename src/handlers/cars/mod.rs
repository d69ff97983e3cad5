pub mod create;
pub mod delete;
pub mod list;
pub mod update;
pub mod utils;
pub mod validate;

// Re-export handler functions for use in routing
pub use create::post as car_create;
pub use delete::delete as car_delete;
pub use list::get as car_list;
pub use update::put as car_update;
pub use validate::patch as cars_validate;
