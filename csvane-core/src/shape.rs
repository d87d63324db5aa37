//! Field-binding resolution: from a record type's field descriptors to an
//! ordered list of columns, each with its coercion and field path.

use std::any::type_name;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use crate::cell::{FromCell, ToCell};
use crate::error::{CellError, ShapeError};
use crate::kind::Coercion;

/// Reserved column name marking a field as ignored.
pub const IGNORE_TAG: &str = "-";

/// Writes the parsed value of one cell into a record.
pub type ParseFn<T> = Box<dyn Fn(&mut T, &str) -> Result<(), CellError>>;

/// Reads one field of a record and formats it as cell text.
pub type FormatFn<T> = Box<dyn Fn(&T) -> Result<String, CellError>>;

/// A type that can be bound to CSV columns, either as a single cell or by
/// flattening its own fields into the parent record.
pub trait Bind: Sized + 'static {
    /// Builds the binding of a field of this type inside the record `P`.
    ///
    /// `get` and `get_mut` project a `P` onto the field.
    fn bind<P: 'static>(get: fn(&P) -> &Self, get_mut: fn(&mut P) -> &mut Self) -> Binding<P>;
}

/// A record type whose fields map onto CSV columns.
///
/// Usually derived with `#[derive(Record)]`. Decoding starts from
/// `Default::default()` and overwrites every bound field, so ignored fields
/// keep their default value.
pub trait Record: Bind + Default {
    /// Returns the descriptor of every declared field, in declaration order.
    fn fields() -> Vec<FieldDef<Self>>;

    /// Resolves the columns of this record type.
    fn shape() -> Result<Shape<Self>, ShapeError> {
        Shape::resolve()
    }
}

/// Conversion hooks of a single-column field.
pub struct Leaf<T> {
    coercion: Coercion,
    type_name: &'static str,
    parse: Option<ParseFn<T>>,
    format: Option<FormatFn<T>>,
}

impl<P: 'static> Leaf<P> {
    /// Creates a leaf with neither capability; add them with
    /// [`parse_with`](Self::parse_with) and [`format_with`](Self::format_with).
    pub fn new(coercion: Coercion, type_name: &'static str) -> Self {
        Leaf {
            coercion,
            type_name,
            parse: None,
            format: None,
        }
    }

    pub fn parse_with<F: FromCell + 'static>(mut self, get_mut: fn(&mut P) -> &mut F) -> Self {
        self.parse = Some(Box::new(move |record: &mut P, raw: &str| {
            *get_mut(record) = F::from_cell(raw)?;
            Ok(())
        }));
        self
    }

    pub fn format_with<F: ToCell + 'static>(mut self, get: fn(&P) -> &F) -> Self {
        self.format = Some(Box::new(move |record: &P| get(record).to_cell()));
        self
    }

    fn project<Q: 'static>(self, get: fn(&Q) -> &P, get_mut: fn(&mut Q) -> &mut P) -> Leaf<Q> {
        Leaf {
            coercion: self.coercion,
            type_name: self.type_name,
            parse: self.parse.map(|parse| -> ParseFn<Q> {
                Box::new(move |record: &mut Q, raw: &str| parse(get_mut(record), raw))
            }),
            format: self.format.map(|format| -> FormatFn<Q> {
                Box::new(move |record: &Q| format(get(record)))
            }),
        }
    }
}

/// How one declared field binds to columns.
pub enum Binding<T> {
    /// The field is not bound to any column.
    Ignored,
    /// The field is a single column.
    Leaf(Leaf<T>),
    /// The field is a record whose own fields become sibling columns.
    Nested {
        type_name: &'static str,
        fields: Vec<FieldDef<T>>,
    },
}

impl<P: 'static> Binding<P> {
    /// Flattens the record `C`, reached through `get`/`get_mut`, into `P`.
    pub fn nested<C: Record>(get: fn(&P) -> &C, get_mut: fn(&mut P) -> &mut C) -> Self {
        Binding::Nested {
            type_name: type_name::<C>(),
            fields: C::fields()
                .into_iter()
                .map(|field| field.project(get, get_mut))
                .collect(),
        }
    }

    fn project<Q: 'static>(self, get: fn(&Q) -> &P, get_mut: fn(&mut Q) -> &mut P) -> Binding<Q> {
        match self {
            Binding::Ignored => Binding::Ignored,
            Binding::Leaf(leaf) => Binding::Leaf(leaf.project(get, get_mut)),
            Binding::Nested { type_name, fields } => Binding::Nested {
                type_name,
                fields: fields
                    .into_iter()
                    .map(|field| field.project(get, get_mut))
                    .collect(),
            },
        }
    }
}

/// Descriptor of one declared field of a record type.
pub struct FieldDef<T> {
    ident: &'static str,
    tag: Option<&'static str>,
    index: usize,
    binding: Binding<T>,
}

impl<T: 'static> FieldDef<T> {
    /// Creates a descriptor.
    ///
    /// `tag` is the declared column name, `None` falls back to `ident`;
    /// `index` is the field's position among the declared fields.
    pub fn new(ident: &'static str, tag: Option<&'static str>, index: usize, binding: Binding<T>) -> Self {
        FieldDef {
            ident,
            tag,
            index,
            binding,
        }
    }

    pub fn column_name(&self) -> &'static str {
        self.tag.unwrap_or(self.ident)
    }

    fn project<Q: 'static>(self, get: fn(&Q) -> &T, get_mut: fn(&mut Q) -> &mut T) -> FieldDef<Q> {
        FieldDef {
            ident: self.ident,
            tag: self.tag,
            index: self.index,
            binding: self.binding.project(get, get_mut),
        }
    }
}

/// One resolved column of a record type.
pub struct FieldSpec<T> {
    name: &'static str,
    path: Vec<usize>,
    leaf: Leaf<T>,
}

impl<T> FieldSpec<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Structural indices of the field, outermost first.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn coercion(&self) -> Coercion {
        self.leaf.coercion
    }

    pub fn type_name(&self) -> &'static str {
        self.leaf.type_name
    }

    pub fn parser(&self) -> Option<&ParseFn<T>> {
        self.leaf.parse.as_ref()
    }

    pub fn formatter(&self) -> Option<&FormatFn<T>> {
        self.leaf.format.as_ref()
    }
}

impl<T> std::fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("coercion", &self.leaf.coercion)
            .field("type_name", &self.leaf.type_name)
            .finish()
    }
}

/// The ordered columns of a record type.
///
/// Column names are unique; resolution fails on a collision instead of
/// letting one field shadow another.
#[derive(Debug)]
pub struct Shape<T> {
    type_name: &'static str,
    fields: IndexMap<&'static str, FieldSpec<T>>,
}

impl<T: Record> Shape<T> {
    /// Walks the declared fields of `T`, flattening nested records.
    pub fn resolve() -> Result<Self, ShapeError> {
        let mut fields = IndexMap::new();
        collect(T::fields(), &[], &mut fields)?;
        if fields.is_empty() {
            return Err(ShapeError::NoFields {
                type_name: type_name::<T>(),
            });
        }
        debug!(record = type_name::<T>(), columns = fields.len(), "resolved shape");
        Ok(Shape {
            type_name: type_name::<T>(),
            fields,
        })
    }
}

impl<T> Shape<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the column names in resolved order.
    pub fn columns(&self) -> Vec<String> {
        self.fields.keys().map(|name| name.to_string()).collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec<T>> {
        self.fields.values()
    }

    pub fn get(&self, column: &str) -> Option<&FieldSpec<T>> {
        self.fields.get(column)
    }
}

fn collect<T>(
    defs: Vec<FieldDef<T>>,
    prefix: &[usize],
    out: &mut IndexMap<&'static str, FieldSpec<T>>,
) -> Result<(), ShapeError> {
    for def in defs {
        if def.tag == Some(IGNORE_TAG) {
            continue;
        }

        let name = def.tag.unwrap_or(def.ident);
        let mut path = prefix.to_vec();
        path.push(def.index);

        match def.binding {
            Binding::Ignored => {}
            Binding::Leaf(leaf) => match out.entry(name) {
                Entry::Occupied(existing) => {
                    return Err(ShapeError::DuplicateColumn {
                        name,
                        first: existing.get().path.clone(),
                        second: path,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(FieldSpec { name, path, leaf });
                }
            },
            Binding::Nested { type_name, fields } => {
                let before = out.len();
                collect(fields, &path, out)?;
                if out.len() == before {
                    return Err(ShapeError::NoFields { type_name });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl Bind for Point {
        fn bind<P: 'static>(get: fn(&P) -> &Self, get_mut: fn(&mut P) -> &mut Self) -> Binding<P> {
            Binding::nested(get, get_mut)
        }
    }

    impl Record for Point {
        fn fields() -> Vec<FieldDef<Self>> {
            vec![
                FieldDef::new("x", None, 0, i32::bind(|p: &Point| &p.x, |p: &mut Point| &mut p.x)),
                FieldDef::new("y", Some("Y"), 1, i32::bind(|p: &Point| &p.y, |p: &mut Point| &mut p.y)),
            ]
        }
    }

    #[derive(Debug, Default)]
    struct Segment {
        label: String,
        start: Point,
        note: String,
    }

    impl Bind for Segment {
        fn bind<P: 'static>(get: fn(&P) -> &Self, get_mut: fn(&mut P) -> &mut Self) -> Binding<P> {
            Binding::nested(get, get_mut)
        }
    }

    impl Record for Segment {
        fn fields() -> Vec<FieldDef<Self>> {
            vec![
                FieldDef::new("label", None, 0, String::bind(|s: &Segment| &s.label, |s: &mut Segment| &mut s.label)),
                FieldDef::new("start", None, 1, Point::bind(|s: &Segment| &s.start, |s: &mut Segment| &mut s.start)),
                FieldDef::new("note", Some(IGNORE_TAG), 2, String::bind(|s: &Segment| &s.note, |s: &mut Segment| &mut s.note)),
            ]
        }
    }

    #[test]
    fn flattens_nested_fields_with_prefixed_paths() {
        let shape = Segment::shape().unwrap();
        assert_eq!(shape.columns(), vec!["label", "x", "Y"]);

        let paths: Vec<_> = shape.fields().map(|f| f.path().to_vec()).collect();
        assert_eq!(paths, vec![vec![0], vec![1, 0], vec![1, 1]]);
        assert_eq!(shape.get("Y").unwrap().coercion(), Coercion::Int(crate::kind::IntType::I32));
    }

    #[test]
    fn ignore_tag_skips_field() {
        let shape = Segment::shape().unwrap();
        assert!(shape.get("note").is_none());
        assert!(shape.get(IGNORE_TAG).is_none());
    }

    #[test]
    fn nested_accessors_reach_inner_fields() {
        let shape = Segment::shape().unwrap();
        let mut segment = Segment::default();

        (shape.get("x").unwrap().parser().unwrap())(&mut segment, "3").unwrap();
        (shape.get("Y").unwrap().parser().unwrap())(&mut segment, "-4").unwrap();
        assert_eq!(segment.start, Point { x: 3, y: -4 });

        let formatted = (shape.get("Y").unwrap().formatter().unwrap())(&segment).unwrap();
        assert_eq!(formatted, "-4");
    }

    #[derive(Debug, Default)]
    struct Clash {
        x: i32,
        point: Point,
    }

    impl Bind for Clash {
        fn bind<P: 'static>(get: fn(&P) -> &Self, get_mut: fn(&mut P) -> &mut Self) -> Binding<P> {
            Binding::nested(get, get_mut)
        }
    }

    impl Record for Clash {
        fn fields() -> Vec<FieldDef<Self>> {
            vec![
                FieldDef::new("x", None, 0, i32::bind(|c: &Clash| &c.x, |c: &mut Clash| &mut c.x)),
                FieldDef::new("point", None, 1, Point::bind(|c: &Clash| &c.point, |c: &mut Clash| &mut c.point)),
            ]
        }
    }

    #[test]
    fn collision_through_flattening_fails() {
        match Clash::shape() {
            Err(ShapeError::DuplicateColumn { name, first, second }) => {
                assert_eq!(name, "x");
                assert_eq!(first, vec![0]);
                assert_eq!(second, vec![1, 0]);
            }
            other => panic!("expected duplicate column, got {other:?}"),
        }
    }

    #[derive(Debug, Default)]
    struct Hidden {
        secret: String,
    }

    impl Bind for Hidden {
        fn bind<P: 'static>(get: fn(&P) -> &Self, get_mut: fn(&mut P) -> &mut Self) -> Binding<P> {
            Binding::nested(get, get_mut)
        }
    }

    impl Record for Hidden {
        fn fields() -> Vec<FieldDef<Self>> {
            vec![FieldDef::new("secret", None, 0, Binding::Ignored)]
        }
    }

    #[test]
    fn no_eligible_fields_fails() {
        assert!(matches!(Hidden::shape(), Err(ShapeError::NoFields { .. })));
    }
}
