pub mod listing_tests;
