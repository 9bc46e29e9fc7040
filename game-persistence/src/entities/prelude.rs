pub use super::game_records::Entity as GameRecords;
