mod test_join_fan_out;
mod test_user_left_on_disconnect;
