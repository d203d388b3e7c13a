//! Argument contract of the batch converter.

use std::path::Path;

/// Arguments for one batch export of `input_path` into `output_dir`.
pub fn batch_args(output_dir: &Path, input_path: &Path) -> Vec<String> {
    vec![
        "-batch".to_string(),
        "-export".to_string(),
        "-output".to_string(),
        output_dir.to_string_lossy().to_string(),
        "--".to_string(),
        input_path.to_string_lossy().to_string(),
    ]
}

/// Encode an argument list as the single comma separated string the Gradle
/// wrapper expects. Elements containing a space or a comma are double quoted.
pub fn escape_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if arg.contains(&[' ', ','][..]) {
                format!("\"{}\"", arg)
            } else {
                arg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
