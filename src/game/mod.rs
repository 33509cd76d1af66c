pub mod predictor;
pub mod round;
pub mod window;

pub use predictor::{Direction, SmaSlopePredictor, Suggestion};
pub use round::{GameRules, GameSession, GuessOutcome, Phase, Resolution, RoundStart, RoundState};
pub use window::StartWindow;
