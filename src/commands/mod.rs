#![allow(clippy::needless_pass_by_value)]

pub mod comment;
pub mod document;
pub mod init;
