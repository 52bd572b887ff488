use mazegen::{app::App, generators::Generator, logging};

fn main() -> std::io::Result<()> {
    let _guard = logging::init_file_logging(std::path::Path::new("mazegen-profile.log"));
    let app = App::default();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok());
    for generator in Generator::ALL {
        app.profile(u8::MAX as u16, u8::MAX as u16, generator, num_iters)?;
    }
    Ok(())
}
