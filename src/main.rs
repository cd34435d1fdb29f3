use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    chatlet::cli::main()
}
