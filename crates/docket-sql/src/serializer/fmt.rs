use super::CommandBuilder;

macro_rules! fmt {
    ($f:expr, $( $fragments:expr )*) => {{
        $(
            $fragments.to_sql($f);
        )*
    }};
}

pub(super) trait ToSql {
    fn to_sql(self, f: &mut CommandBuilder);
}

impl ToSql for &str {
    fn to_sql(self, f: &mut CommandBuilder) {
        f.sql.push_str(self);
    }
}

impl ToSql for &String {
    fn to_sql(self, f: &mut CommandBuilder) {
        f.sql.push_str(self);
    }
}

impl ToSql for u64 {
    fn to_sql(self, f: &mut CommandBuilder) {
        use std::fmt::Write;

        // Writing into a `String` cannot fail
        let _ = write!(&mut f.sql, "{self}");
    }
}

impl<T: ToSql> ToSql for Option<T> {
    fn to_sql(self, f: &mut CommandBuilder) {
        if let Some(inner) = self {
            inner.to_sql(f);
        }
    }
}
