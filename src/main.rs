fn main() -> Result<(), Box<dyn std::error::Error>> {
    vistachat::cli::main()
}
