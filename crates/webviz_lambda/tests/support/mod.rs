#![allow(dead_code)]

pub mod backends;
