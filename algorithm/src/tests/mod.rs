mod test_marker;
mod test_path;
