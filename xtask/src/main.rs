/// The xtask binary delegates entirely to nih_plug_xtask, which provides
/// the `bundle` subcommand. Usage:
///
///   cargo xtask bundle furse-delay --release
///
/// This builds the cdylib once and packages all ten delays into
/// `target/bundled/furse-delay.clap` and `target/bundled/furse-delay.vst3`.
fn main() -> nih_plug_xtask::Result<()> {
    nih_plug_xtask::main()
}
