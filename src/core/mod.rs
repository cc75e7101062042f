pub mod catalog;
pub mod deposit;
pub mod general;
pub mod loan;
pub mod reference;
pub mod schemes;
pub mod tax;
pub mod types;
pub mod validation;
pub mod withdrawal;

pub use catalog::{PRODUCTS, Product, compute, product_keys};
pub use types::{AssetType, CityType, Frequency, HoldingTerm, InvestmentType, Operation};
pub use validation::{Choice, Form, NumberField, Params};
