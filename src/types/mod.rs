pub mod accessory;
pub mod conditions;
pub mod criteria;
pub mod grade;
pub mod measurement;
pub mod pollutant;
