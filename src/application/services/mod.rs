pub mod channel;
pub mod formatter;
