mod clean;
mod config;
mod missing;
mod violations;
