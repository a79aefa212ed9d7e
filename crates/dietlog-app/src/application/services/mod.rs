mod streak_tracker;

pub use streak_tracker::StreakTracker;
