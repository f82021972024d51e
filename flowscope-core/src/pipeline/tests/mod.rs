mod replay_tests;
