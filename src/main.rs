fn main() -> std::process::ExitCode {
    qc_ledger_lib::run()
}
