mod control_tests;
