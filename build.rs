use std::env;

fn main() {
    // Build-time defaults for the rover parameters
    // These seed the parameter store when nothing overrides them

    // Control tick interval in milliseconds (default: 50)
    if let Ok(tick) = env::var("ROVER_TICK_MS") {
        println!("cargo:rustc-env=ROVER_TICK_MS={}", tick);
        println!("cargo:warning=Using ROVER_TICK_MS from environment: {}", tick);
    } else {
        println!("cargo:rustc-env=ROVER_TICK_MS=50");
    }

    // Console UART baud rate (default: 115200)
    if let Ok(baud) = env::var("ROVER_CONSOLE_BAUD") {
        println!("cargo:rustc-env=ROVER_CONSOLE_BAUD={}", baud);
        println!(
            "cargo:warning=Using ROVER_CONSOLE_BAUD from environment: {}",
            baud
        );
    } else {
        println!("cargo:rustc-env=ROVER_CONSOLE_BAUD=115200");
    }

    // Rerun if environment variables change
    println!("cargo:rerun-if-env-changed=ROVER_TICK_MS");
    println!("cargo:rerun-if-env-changed=ROVER_CONSOLE_BAUD");
}
