mod common;
mod scoring;
mod skills;
mod stages;
