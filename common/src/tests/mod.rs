mod test_zone;
