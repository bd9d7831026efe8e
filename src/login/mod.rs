pub mod controller;
pub mod credentials;
pub mod fields;
pub mod otp;
