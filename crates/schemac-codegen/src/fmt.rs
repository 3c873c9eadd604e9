/// Appends each fragment to the formatter in order.
///
/// Fragments are written back to back: `fmt!(f, "class " name "(Base):\n")`.
/// A fragment must not start with `(`, `[`, `&`, `-` or `.`, which would
/// continue the previous expression; bind it to a local first.
macro_rules! fmt {
    ($f:expr, $( $fragments:expr )*) => {{
        $(
            $crate::fmt::ToCode::to_code($fragments, $f);
        )*
    }};
}

/// Accumulates the text of one generated file
#[derive(Debug, Default)]
pub(crate) struct Formatter {
    dst: String,
}

pub(crate) trait ToCode {
    fn to_code(self, f: &mut Formatter);
}

/// Comma delimited
pub(crate) struct Comma<L>(pub(crate) L);

/// Each item followed by a newline
pub(crate) struct Lines<L>(pub(crate) L);

impl Formatter {
    pub(crate) fn new() -> Formatter {
        Formatter::default()
    }

    pub(crate) fn finish(self) -> String {
        self.dst
    }
}

impl ToCode for &str {
    fn to_code(self, f: &mut Formatter) {
        f.dst.push_str(self);
    }
}

impl ToCode for &String {
    fn to_code(self, f: &mut Formatter) {
        f.dst.push_str(self);
    }
}

impl ToCode for String {
    fn to_code(self, f: &mut Formatter) {
        f.dst.push_str(&self);
    }
}

impl<L> ToCode for Comma<L>
where
    L: IntoIterator,
    L::Item: ToCode,
{
    fn to_code(self, f: &mut Formatter) {
        let mut s = "";
        for i in self.0 {
            fmt!(f, s i);
            s = ", ";
        }
    }
}

impl<L> ToCode for Lines<L>
where
    L: IntoIterator,
    L::Item: ToCode,
{
    fn to_code(self, f: &mut Formatter) {
        for i in self.0 {
            fmt!(f, i "\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_are_concatenated() {
        let mut f = Formatter::new();
        let name = &"Users".to_string();

        fmt!(&mut f, "class " name "(" Comma(["Base", "Mixin"]) "):\n");

        assert_eq!(f.finish(), "class Users(Base, Mixin):\n");
    }

    #[test]
    fn lines() {
        let mut f = Formatter::new();
        fmt!(&mut f, Lines(vec!["import uuid".to_string(), "import datetime".to_string()]));
        assert_eq!(f.finish(), "import uuid\nimport datetime\n");
    }
}
