//! Source language detection
//!
//! Resolves "auto" requests to a concrete language: file extension first,
//! then content markers, defaulting to python. Pure and deterministic so
//! the same submission always analyzes as the same language.

/// Detect the source language of `code`.
///
/// A recognized file extension wins over content markers.
pub fn detect_language(code: &str, file_name: Option<&str>) -> &'static str {
    if let Some(lang) = file_name.and_then(language_from_extension) {
        return lang;
    }
    language_from_content(code)
}

fn language_from_extension(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit('.').next()?.to_lowercase();
    let lang = match ext.as_str() {
        "py" => "python",
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "java" => "java",
        "cpp" => "cpp",
        "c" => "c",
        "cs" => "csharp",
        "php" => "php",
        "rb" => "ruby",
        "go" => "go",
        "rs" => "rust",
        "swift" => "swift",
        "kt" => "kotlin",
        "scala" => "scala",
        "r" => "r",
        "sql" => "sql",
        "html" => "html",
        "css" => "css",
        "vue" => "vue",
        "svelte" => "svelte",
        _ => return None,
    };
    Some(lang)
}

const PYTHON_MARKERS: &[&str] = &["def ", "import ", "from ", "print("];
const JS_MARKERS: &[&str] = &["function ", "const ", "let ", "var ", "=>", "console.log"];
const JAVA_MARKERS: &[&str] = &["public class", "public static", "System.out"];
const C_MARKERS: &[&str] = &["#include", "int main", "printf", "cout"];

/// Marker priority is fixed: python, then JS/TS, then java, then C/C++.
fn language_from_content(code: &str) -> &'static str {
    if PYTHON_MARKERS.iter().any(|m| code.contains(m)) {
        return "python";
    }
    if JS_MARKERS.iter().any(|m| code.contains(m)) {
        // An interface keyword plus type annotations points at TypeScript.
        if code.contains(": ") && code.to_lowercase().contains("interface ") {
            return "typescript";
        }
        return "javascript";
    }
    if JAVA_MARKERS.iter().any(|m| code.contains(m)) {
        return "java";
    }
    if C_MARKERS.iter().any(|m| code.contains(m)) {
        return "cpp";
    }
    "python"
}
