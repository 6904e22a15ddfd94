mod fixture;

mod composed;
mod independence;
