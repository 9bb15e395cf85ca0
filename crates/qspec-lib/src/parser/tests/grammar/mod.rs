mod asserts_tests;
mod declarations_tests;
mod scopes_tests;
mod setup_tests;
mod values_tests;
