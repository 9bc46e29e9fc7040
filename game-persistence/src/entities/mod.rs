pub mod prelude;

pub mod game_records;
