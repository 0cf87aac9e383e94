pub mod race_fixture;
