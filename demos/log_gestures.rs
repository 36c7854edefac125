//! Log every gesture begin on the default seat.
//!
//! Run with: RUST_LOG=debug cargo run --example log_gestures --features libinput
//!
//! Note: the user needs to be in the `input` group.

use gesture_gatherer::{Config, Gesture, gather};

fn main() {
    env_logger::init();

    let seat = std::env::args().nth(1).unwrap_or_else(|| "seat0".to_string());
    println!("gesture-gatherer demo on {}", seat);
    println!("Press Ctrl+C to exit\n");

    let mut count = 0u64;
    match gather(Config::new().with_seat(seat), |gesture: Gesture| {
        count += 1;
        println!(
            "[{}] {:?} begin: {} fingers on {} at {}us",
            count,
            gesture.gesture_type,
            gesture.fingers,
            gesture.device.as_deref().unwrap_or("unknown"),
            gesture.time_usec
        );
    }) {
        Ok(stopped) => eprintln!(
            "Stopped after {} drain cycles: {}",
            stopped.cycles, stopped.cause
        ),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
