//! SeaORM entities for the tables the SQL store manages.

pub mod design;

pub mod prelude {
    pub use super::design::ActiveModel as DesignActiveModel;
    pub use super::design::Column as DesignColumn;
    pub use super::design::Entity as DesignEntity;
    pub use super::design::Model as DesignModel;
}
