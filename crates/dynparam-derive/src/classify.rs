// Field type classification
//
// Maps a field's declared type onto the tagged value model. Classification is
// syntactic: scalars are recognised by name, `Option` and `Vec` by the last
// path segment, std containers and multi-argument types are skipped, and any
// other named type is assumed to implement DynamicParameters. A wrong assumption surfaces as a compile error at the
// generated call, not at runtime.

use syn::{GenericArgument, PathArguments, PathSegment, Type, TypePath};

/// How the elements of an array field are captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Scalar,
    OptionalScalar,
    Struct,
}

/// Classification of a field's declared type.
///
/// Every variant carries the type the engine functions are instantiated with:
/// the field type for scalars and structs, the inner type for optionals, the
/// element's scalar or struct type for arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar(Type),
    OptionalScalar(Type),
    Array { element: ElementKind, ty: Type },
    Struct(Type),
    OptionalStruct(Type),
}

/// A declared type with no tagged value representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported {
    pub reason: &'static str,
}

fn unsupported(reason: &'static str) -> Unsupported {
    Unsupported { reason }
}

/// Integer, float, string and bool types accepted as scalars
const SCALARS: &[&str] = &[
    "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "f32", "f64", "String", "bool",
];

/// Primitives that exist but can't round-trip through the scalar kinds
const LOSSY_PRIMITIVES: &[&str] = &["u64", "u128", "i128", "usize", "char", "str"];

/// Standard containers with no tagged value representation
const STD_COMPOUNDS: &[&str] = &[
    "HashMap", "HashSet", "BTreeMap", "BTreeSet", "VecDeque", "LinkedList", "BinaryHeap", "Result",
];

pub fn classify(ty: &Type) -> Result<FieldKind, Unsupported> {
    match ty {
        Type::Group(group) => classify(&group.elem),
        Type::Paren(paren) => classify(&paren.elem),
        Type::Path(path) if path.qself.is_none() => classify_path(ty, path),
        Type::Path(_) => Err(unsupported("qualified paths are not classified")),
        Type::BareFn(_) => Err(unsupported("function pointers have no tagged value")),
        Type::Tuple(tuple) if tuple.elems.is_empty() => {
            Err(unsupported("the unit type has no tagged value"))
        }
        Type::Tuple(_) => Err(unsupported("tuples have no tagged value")),
        Type::Reference(_) | Type::Ptr(_) => {
            Err(unsupported("borrowed and raw pointers have no tagged value"))
        }
        Type::Array(_) | Type::Slice(_) => {
            Err(unsupported("fixed-size arrays and slices are not supported, use Vec"))
        }
        Type::TraitObject(_) | Type::ImplTrait(_) => {
            Err(unsupported("trait objects have no tagged value"))
        }
        _ => Err(unsupported("unsupported type syntax")),
    }
}

fn classify_path(ty: &Type, path: &TypePath) -> Result<FieldKind, Unsupported> {
    let Some(segment) = path.path.segments.last() else {
        return Err(unsupported("empty type path"));
    };
    let name = segment.ident.to_string();

    match name.as_str() {
        "Option" => match classify(single_type_argument(segment)?)? {
            FieldKind::Scalar(inner) => Ok(FieldKind::OptionalScalar(inner)),
            FieldKind::Struct(inner) => Ok(FieldKind::OptionalStruct(inner)),
            _ => Err(unsupported("Option is only supported around scalars and structs")),
        },
        "Vec" => match classify(single_type_argument(segment)?)? {
            FieldKind::Scalar(ty) => Ok(FieldKind::Array {
                element: ElementKind::Scalar,
                ty,
            }),
            FieldKind::OptionalScalar(ty) => Ok(FieldKind::Array {
                element: ElementKind::OptionalScalar,
                ty,
            }),
            FieldKind::Struct(ty) => Ok(FieldKind::Array {
                element: ElementKind::Struct,
                ty,
            }),
            _ => Err(unsupported(
                "Vec is only supported around scalars, optional scalars and structs",
            )),
        },
        scalar if SCALARS.contains(&scalar) && segment.arguments.is_none() => {
            Ok(FieldKind::Scalar(ty.clone()))
        }
        lossy if LOSSY_PRIMITIVES.contains(&lossy) => Err(unsupported(
            "integer and character types outside the i64 range have no lossless tagged value",
        )),
        compound if STD_COMPOUNDS.contains(&compound) => Err(unsupported(
            "maps, sets, queues and results have no tagged value",
        )),
        _ if type_argument_count(segment) > 1 => Err(unsupported(
            "types with several type arguments are not classified",
        )),
        _ => Ok(FieldKind::Struct(ty.clone())),
    }
}

fn type_argument_count(segment: &PathSegment) -> usize {
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter(|arg| matches!(arg, GenericArgument::Type(_)))
            .count(),
        _ => 0,
    }
}

fn single_type_argument(segment: &PathSegment) -> Result<&Type, Unsupported> {
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return Err(unsupported("expected a type argument"));
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    match (types.next(), types.next()) {
        (Some(ty), None) => Ok(ty),
        _ => Err(unsupported("expected exactly one type argument")),
    }
}
