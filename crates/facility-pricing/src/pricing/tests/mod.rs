mod common;
mod proposal;
mod service;
