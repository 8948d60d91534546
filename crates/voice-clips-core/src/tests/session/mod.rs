mod stopwatch;
mod ticker;
