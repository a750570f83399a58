//! 列名参数的统一入口：单个字符串、数组、切片、Vec 都可以直接传给 `select`。
//! `select_cols!` 允许不定长参数而无需手动创建 `Vec`。

pub trait IntoStrings {
    fn extend_into_strings(self, dst: &mut Vec<String>);
}

impl IntoStrings for String {
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.push(self);
    }
}

impl IntoStrings for &str {
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.push(self.to_string());
    }
}

impl<const N: usize, T> IntoStrings for [T; N]
where
    T: Into<String>,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.extend(self.into_iter().map(Into::into));
    }
}

impl<T> IntoStrings for &[T]
where
    T: Into<String> + Clone,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.extend(self.iter().cloned().map(Into::into));
    }
}

impl<T> IntoStrings for Vec<T>
where
    T: Into<String>,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.extend(self.into_iter().map(Into::into));
    }
}

#[doc(hidden)]
pub fn extend_into_strings<T: IntoStrings>(value: T, dst: &mut Vec<String>) {
    value.extend_into_strings(dst);
}

#[doc(hidden)]
pub fn collect_into_strings<T: IntoStrings>(value: T) -> Vec<String> {
    let mut dst = Vec::new();
    value.extend_into_strings(&mut dst);
    dst
}

#[doc(hidden)]
#[macro_export]
macro_rules! __collect_strings {
    () => {
        Vec::<String>::new()
    };
    ($($value:expr),+ $(,)?) => {{
        let mut values = Vec::<String>::new();
        $(
            $crate::macros::extend_into_strings($value, &mut values);
        )*
        values
    }};
}

/// `QueryBuilder::select` 的可变参数写法：`select_cols!(qb, "id", "name")`。
#[macro_export]
macro_rules! select_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $builder.select($crate::__collect_strings!($($col),*))
    };
}

/// `QueryBuilder::select_more` 的可变参数写法。
#[macro_export]
macro_rules! select_more_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $builder.select_more($crate::__collect_strings!($($col),*))
    };
}
