//! JSON format tests

mod conversion;
