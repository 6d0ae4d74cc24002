fn main() -> std::process::ExitCode {
  bookshelf_lib::run()
}
