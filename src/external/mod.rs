pub mod reference_data;
pub mod fiscal_data;
