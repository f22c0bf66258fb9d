pub mod design_routes;
pub mod page_routes;
