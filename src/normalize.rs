use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A square root glyph directly followed by a run of digits.
    static ref SQRT_DIGITS: Regex = Regex::new(r"(?i)√([0-9]+)").unwrap();
}

/// Rewrites display glyphs into evaluator syntax: `x` to `*`, `÷` to `/`
/// and `√144` to `Math.sqrt(144)`.
///
/// Powers, cube roots and logs are rewritten when their keys are pressed,
/// so they never reach this step as glyphs.
pub fn normalize(input: &str) -> String {
    let expr = input.replace('x', "*").replace('÷', "/");
    let expr = SQRT_DIGITS
        .replace_all(&expr, "Math.sqrt(${1})")
        .into_owned();
    tracing::trace!(input, normalized = %expr, "normalized");
    expr
}

#[cfg(test)]
mod tests {
    use super::normalize;

    macro_rules! check_normalize {
        ($($input:expr => $expected:expr),+ $(,)?) => {{
            $(assert_eq!(normalize($input), $expected, "<input: '{}'>", $input);)+
        }};
    }

    #[test]
    fn test_glyphs() {
        check_normalize! {
            "2x3" => "2*3",
            "8÷2" => "8/2",
            "2x3x4÷6" => "2*3*4/6",
            "1+2" => "1+2",
            "" => "",
        }
    }

    #[test]
    fn test_square_root() {
        check_normalize! {
            "√144" => "Math.sqrt(144)",
            "√16+√9" => "Math.sqrt(16)+Math.sqrt(9)",
            "2x√16" => "2*Math.sqrt(16)",
            "√2.25" => "Math.sqrt(2).25",
            "√(4)" => "√(4)",
            "√" => "√",
        }
    }

    #[test]
    fn test_idempotent() {
        for input in ["2x3", "√144÷√9", "5**(1/3)", "Math.log10(100)", "√(4)x2", "-√81"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "<input: '{input}'>");
        }
    }
}
