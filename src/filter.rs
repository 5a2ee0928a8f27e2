use regex::Regex;

/// Gives a key a textual form for the pattern-based filters.
///
/// Glob and regex filters only apply to string-like keys; a key whose
/// `key_text` is `None` never matches a pattern filter. Explicit key lists
/// and predicates work for every key type.
pub trait KeyText {
  fn key_text(&self) -> Option<&str>;
}

impl KeyText for String {
  fn key_text(&self) -> Option<&str> {
    Some(self)
  }
}

impl KeyText for &str {
  fn key_text(&self) -> Option<&str> {
    Some(self)
  }
}

impl KeyText for Box<str> {
  fn key_text(&self) -> Option<&str> {
    Some(self)
  }
}

impl KeyText for std::sync::Arc<str> {
  fn key_text(&self) -> Option<&str> {
    Some(self)
  }
}

macro_rules! impl_key_text_none {
  ($($ty:ty),* $(,)?) => {
    $(impl KeyText for $ty {
      fn key_text(&self) -> Option<&str> {
        None
      }
    })*
  };
}

impl_key_text_none!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool);

/// A key selector accepted by the bulk read/delete operations.
///
/// Four forms: an explicit collection of keys, a glob-style wildcard
/// pattern (`*` and `?`), a precompiled regular expression, or an arbitrary
/// predicate. The pattern forms match against the full key text.
pub enum KeyFilter<K> {
  Keys(Vec<K>),
  Pattern(Regex),
  Predicate(Box<dyn Fn(&K) -> bool + Send + Sync>),
}

impl<K> KeyFilter<K> {
  /// Filter by an explicit collection of keys.
  pub fn keys(keys: impl IntoIterator<Item = K>) -> Self {
    KeyFilter::Keys(keys.into_iter().collect())
  }

  /// Filter string keys by a glob pattern: `*` matches any run of
  /// characters, `?` matches exactly one, everything else is literal.
  pub fn glob(pattern: &str) -> Self {
    let mut translated = String::with_capacity(pattern.len() + 8);
    translated.push('^');
    for ch in pattern.chars() {
      match ch {
        '*' => translated.push_str(".*"),
        '?' => translated.push('.'),
        _ => translated.push_str(&regex::escape(&ch.to_string())),
      }
    }
    translated.push('$');
    // The translation escapes every metacharacter, so compilation only sees
    // literals, `.*`, and `.`.
    let re = Regex::new(&translated).expect("escaped glob pattern is a valid regex");
    KeyFilter::Pattern(re)
  }

  /// Filter string keys by a precompiled regular expression.
  pub fn regex(re: Regex) -> Self {
    KeyFilter::Pattern(re)
  }

  /// Filter by an arbitrary predicate.
  pub fn predicate(f: impl Fn(&K) -> bool + Send + Sync + 'static) -> Self {
    KeyFilter::Predicate(Box::new(f))
  }
}

impl<K: Eq + KeyText> KeyFilter<K> {
  /// Whether the filter selects `key`.
  pub fn matches(&self, key: &K) -> bool {
    match self {
      KeyFilter::Keys(keys) => keys.contains(key),
      KeyFilter::Pattern(re) => key.key_text().is_some_and(|text| re.is_match(text)),
      KeyFilter::Predicate(f) => f(key),
    }
  }
}
