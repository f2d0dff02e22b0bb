fn main() {
    jr_cli::init_tracing();
    std::process::exit(jr_cli::run_cli_from_args(std::env::args_os()));
}
