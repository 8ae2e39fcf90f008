mod logger;
mod table;

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;

use mbr::MbrError;

static TOOL_NAME: &str = env!("CARGO_PKG_NAME");
static TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
enum CliError {
    Usage { program: String },
    Open { path: String, cause: io::Error },
    Table(MbrError),
    Output(io::Error),
    /// The table was printed, but at least one extended chain ended early.
    Incomplete(usize),
}

impl CliError {
    fn exit_status(&self) -> u8 {
        match self {
            CliError::Incomplete(_) => 2,
            _ => 1,
        }
    }

    fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage { program } => write!(f, "Usage: {} /dev/sdX", program),
            CliError::Open { path, cause } => write!(f, "open {}: {}", path, cause),
            CliError::Table(cause) => write!(f, "{}", cause),
            CliError::Output(cause) => write!(f, "write: {}", cause),
            CliError::Incomplete(count) => write!(
                f,
                "{} extended partition chain(s) could not be read completely",
                count
            ),
        }
    }
}

/// `args` includes the program name, as returned by `std::env::args`.
fn run<W: Write>(args: &[String], out: &mut W) -> Result<(), CliError> {
    let [_, device] = args else {
        let program = args.first().map_or(TOOL_NAME, String::as_str);
        return Err(CliError::Usage { program: program.to_string() });
    };
    log::debug!("{} v{} reading {}", TOOL_NAME, TOOL_VERSION, device);

    let file = File::open(device).map_err(|cause| CliError::Open {
        path: device.clone(),
        cause,
    })?;
    let mut source = BufReader::new(file);
    let layout = mbr::assemble(&mut source, device).map_err(CliError::Table)?;

    table::print_table(out, &layout.partitions).map_err(CliError::Output)?;

    // chain errors are diagnostics regardless of the log level
    for err in &layout.chain_errors {
        eprintln!("{}: {}: {}", TOOL_NAME, device, err);
    }
    if layout.is_complete() {
        Ok(())
    } else {
        Err(CliError::Incomplete(layout.chain_errors.len()))
    }
}

fn main() -> ExitCode {
    if let Err(err) = logger::init() {
        eprintln!("{}: {}", TOOL_NAME, err);
    }

    let args: Vec<String> = std::env::args().collect();
    match run(&args, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ CliError::Usage { .. }) => {
            eprintln!("{}", err);
            err.exit_code()
        }
        Err(err) => {
            eprintln!("{}: {}", TOOL_NAME, err);
            err.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbr::ErrorCause;
    use std::path::PathBuf;

    /// A disk image in the temp dir, removed on drop.
    struct Image {
        path: PathBuf,
    }

    impl Image {
        fn write(name: &str, bytes: &[u8]) -> Image {
            let path = std::env::temp_dir()
                .join(format!("{}-{}-{}.img", TOOL_NAME, std::process::id(), name));
            std::fs::write(&path, bytes).unwrap();
            Image { path }
        }

        fn args(&self) -> Vec<String> {
            vec![TOOL_NAME.to_string(), self.path.to_string_lossy().into_owned()]
        }
    }

    impl Drop for Image {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn put_entry(disk: &mut [u8], offset: usize, tag: u8, start: u32, count: u32) {
        disk[offset + 4] = tag;
        disk[offset + 8..offset + 12].copy_from_slice(&start.to_le_bytes());
        disk[offset + 12..offset + 16].copy_from_slice(&count.to_le_bytes());
    }

    fn signed_disk(sectors: usize) -> Vec<u8> {
        let mut disk = vec![0u8; sectors * mbr::SECTOR_SIZE];
        disk[510] = 0x55;
        disk[511] = 0xaa;
        disk
    }

    #[test]
    fn good_image_succeeds() {
        let mut disk = signed_disk(1);
        put_entry(&mut disk, mbr::TABLE_OFFSET, 0x83, 2048, 204800);
        let image = Image::write("good", &disk);

        let mut out = Vec::new();
        run(&image.args(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("100.0M Linux"));
    }

    #[test]
    fn wrong_argument_count_is_usage() {
        let cases: [Vec<String>; 3] = [
            vec!["/bin/mbrinfo".into()],
            vec![],
            vec!["a".into(), "b".into(), "c".into()],
        ];
        for args in cases {
            let err = run(&args, &mut io::sink()).unwrap_err();
            assert!(matches!(err, CliError::Usage { .. }), "{:?}", err);
            assert_eq!(err.exit_status(), 1);
        }
    }

    #[test]
    fn usage_names_the_invoked_program() {
        let err = run(&["/usr/local/bin/mbrinfo".to_string()], &mut io::sink()).unwrap_err();
        assert_eq!(err.to_string(), "Usage: /usr/local/bin/mbrinfo /dev/sdX");
    }

    #[test]
    fn missing_path_is_open_error() {
        let args = vec![TOOL_NAME.to_string(), "/nonexistent/mbrinfo-disk.img".to_string()];
        let mut out = Vec::new();
        let err = run(&args, &mut out).unwrap_err();
        assert!(matches!(err, CliError::Open { .. }), "{:?}", err);
        assert_eq!(err.exit_status(), 1);
        assert!(err.to_string().starts_with("open /nonexistent/mbrinfo-disk.img: "));
        assert!(out.is_empty());
    }

    #[test]
    fn bad_signature_is_table_error() {
        let image = Image::write("unsigned", &[0u8; 512]);
        let mut out = Vec::new();
        let err = run(&image.args(), &mut out).unwrap_err();
        match &err {
            CliError::Table(cause) => {
                assert_eq!(cause.cause, ErrorCause::InvalidSignature { actual: [0, 0] })
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.exit_status(), 1);
        assert_eq!(err.to_string(), "invalid MBR signature 00 00 (expected 55 aa)");
        assert!(out.is_empty());
    }

    #[test]
    fn self_linked_chain_prints_table_and_exits_2() {
        let mut disk = signed_disk(12);
        put_entry(&mut disk, mbr::TABLE_OFFSET, 0x05, 10, 2);
        put_entry(&mut disk, 10 * 512, 0x83, 11, 1);
        put_entry(&mut disk, 10 * 512 + 16, 0x05, 10, 0);
        let image = Image::write("cyclic", &disk);

        let mut out = Vec::new();
        let err = run(&image.args(), &mut out).unwrap_err();
        assert!(matches!(err, CliError::Incomplete(1)), "{:?}", err);
        assert_eq!(err.exit_status(), 2);
        // header, the extended container and its one logical partition
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }
}
