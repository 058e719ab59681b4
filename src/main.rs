fn main() -> Result<(), Box<dyn std::error::Error>> {
    moodplay::runtime::run()
}
