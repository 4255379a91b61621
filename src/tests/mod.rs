mod client_tests;
mod integration;
