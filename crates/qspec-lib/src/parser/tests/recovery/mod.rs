mod limits_tests;
mod misplaced_tests;
mod scenarios_tests;
mod unclosed_tests;
