mod properties;
mod tests;
