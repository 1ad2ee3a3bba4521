pub mod game_data;
pub mod scanner;
