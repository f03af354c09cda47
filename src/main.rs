// This binary crate is intentionally minimal.
// All neural network logic lives in the library (src/lib.rs and its modules).
// Run the paged XOR demo with:
//   cargo run --example xor
fn main() {
    println!("dense-paged-nn: a feed-forward neural network with disk-paged training.");
    println!("Run `cargo run --example xor` to see the XOR demo.");
}
