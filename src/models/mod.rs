pub mod barcode;
pub mod dto;
pub mod metadata;
pub mod role;
