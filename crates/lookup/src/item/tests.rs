use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use attr_primitives::{Identifier, TypeTag};
use attr_query_map::Address;
use pretty_assertions::assert_eq;

use super::*;
use crate::error::{InvalidArgument, LookupError};

#[derive(Debug)]
struct Block {
	id: Identifier,
}

impl Item for Block {
	fn id(&self) -> &Identifier {
		&self.id
	}
}

#[derive(Debug, Clone, PartialEq)]
struct Battery {
	id: Identifier,
	capacity: u32,
}

impl Item for Battery {
	fn id(&self) -> &Identifier {
		&self.id
	}
}

struct Furnace;

fn id(text: &str) -> Identifier {
	Identifier::parse(text).expect("valid identifier")
}

fn block(name: &str) -> ItemRef {
	Arc::new(Block { id: id(name) })
}

fn battery(name: &str, capacity: u32) -> Arc<Battery> {
	Arc::new(Battery {
		id: id(name),
		capacity,
	})
}

fn constant(value: &'static str) -> ItemAttributeProvider<&'static str, Furnace> {
	ItemAttributeProvider::new(move |_, _| Some(value))
}

fn absent() -> ItemAttributeProvider<&'static str, Furnace> {
	ItemAttributeProvider::new(|_, _| None)
}

fn fuel_lookup() -> Arc<ItemAttributeLookup<&'static str, Furnace>> {
	ItemAttributeLookups::new()
		.get(&id("test:fuel"))
		.expect("fresh registry")
}

#[test]
fn keyed_provider_short_circuits_fallbacks() {
	let lookup = fuel_lookup();
	let coal = block("test:coal");
	lookup.register_for_items(constant("Y"), [&coal]).unwrap();
	lookup.register_fallback(constant("X"));

	assert_eq!(lookup.find(&ItemStack::of(&coal), &Furnace), Some("Y"));
}

#[test]
fn keyed_miss_falls_through_to_fallback() {
	let lookup = fuel_lookup();
	let coal = block("test:coal");
	lookup.register_for_items(absent(), [&coal]).unwrap();
	lookup.register_fallback(constant("X"));

	assert_eq!(lookup.find(&ItemStack::of(&coal), &Furnace), Some("X"));
	assert_eq!(lookup.find(&ItemStack::of(block("test:stone")), &Furnace), Some("X"));
}

#[test]
fn nothing_registered_finds_nothing() {
	let lookup = fuel_lookup();
	assert_eq!(lookup.find(&ItemStack::of(block("test:coal")), &Furnace), None);

	lookup.register_fallback(absent());
	assert_eq!(lookup.find(&ItemStack::of(block("test:coal")), &Furnace), None);
}

#[test]
fn fallbacks_run_in_registration_order() {
	let lookup = fuel_lookup();
	let calls = Arc::new(AtomicUsize::new(0));
	let counting = {
		let calls = calls.clone();
		ItemAttributeProvider::new(move |_, _: &Furnace| {
			calls.fetch_add(1, Ordering::SeqCst);
			None
		})
	};

	lookup.register_fallback(counting.clone());
	lookup.register_fallback(counting);
	lookup.register_fallback(constant("first"));
	lookup.register_fallback(constant("second"));

	assert_eq!(lookup.find(&ItemStack::of(block("test:coal")), &Furnace), Some("first"));
	assert_eq!(calls.load(Ordering::SeqCst), 2);
	assert_eq!(lookup.fallback_count(), 4);
}

#[test]
fn duplicate_keys_keep_first_provider_and_are_reported() {
	let lookup = fuel_lookup();
	let (k1, k2, k3) = (block("test:k1"), block("test:k2"), block("test:k3"));
	let p = constant("p");
	let p2 = constant("p2");

	let rejected = lookup.register_for_items(p.clone(), [&k1, &k2]).unwrap();
	assert!(rejected.is_empty());

	let rejected = lookup.register_for_items(p2.clone(), [&k2, &k3]).unwrap();
	assert_eq!(rejected.len(), 1);
	assert_eq!(rejected.get(&Address::of(&k2)), Some(&p));

	assert_eq!(lookup.get_provider(&*k1), Some(p.clone()));
	assert_eq!(lookup.get_provider(&*k2), Some(p));
	assert_eq!(lookup.get_provider(&*k3), Some(p2));
	assert_eq!(lookup.providers().len(), 3);
}

#[test]
fn empty_registration_is_invalid() {
	let lookup = fuel_lookup();
	let err = lookup
		.register_for_items(constant("p"), Vec::<ItemRef>::new())
		.unwrap_err();
	assert_eq!(err, LookupError::InvalidArgument(InvalidArgument::EmptyKeys));

	let err = lookup.register_self(Vec::<ItemRef>::new());
	assert!(err.is_err());
}

#[test]
fn items_are_keyed_by_identity() {
	let lookup = fuel_lookup();
	let original = block("test:coal");
	let lookalike = block("test:coal");
	lookup.register_for_items(constant("Y"), [&original]).unwrap();

	assert_eq!(lookup.find(&ItemStack::of(&lookalike), &Furnace), None);
	assert!(lookup.get_provider(&*lookalike).is_none());
}

#[test]
fn register_self_returns_the_item() {
	let lookups = ItemAttributeLookups::new();
	let energy = lookups
		.get::<Battery, Furnace>(&id("test:energy"))
		.unwrap();
	let cell = battery("test:cell", 400);
	energy.register_self([&cell]).unwrap();

	let found = energy.find(&ItemStack::new(&cell, 3), &Furnace);
	assert_eq!(found, Some((*cell).clone()));
}

#[test]
fn register_self_is_all_or_nothing() {
	let lookups = ItemAttributeLookups::new();
	let energy = lookups
		.get::<Battery, Furnace>(&id("test:energy"))
		.unwrap();
	let cell: ItemRef = battery("test:cell", 400);
	let coal = block("test:coal");

	let err = energy.register_self([&cell, &coal]).unwrap_err();

	assert_eq!(
		err,
		LookupError::InvalidArgument(InvalidArgument::NotSelfAttribute {
			attribute: TypeTag::of::<Battery>(),
			item: std::any::type_name::<Block>(),
		})
	);
	assert!(energy.providers().is_empty());
	assert!(energy.get_provider(&*cell).is_none());
}

#[test]
fn registry_returns_one_instance_per_id() {
	let lookups = ItemAttributeLookups::new();
	let a = lookups
		.get::<&'static str, Furnace>(&id("test:fuel"))
		.unwrap();
	let b = lookups
		.get_named::<&'static str, Furnace>("test:fuel")
		.unwrap();

	assert!(Arc::ptr_eq(&a, &b));
	assert_eq!(a.id(), &id("test:fuel"));
	assert_eq!(a.attribute_type(), TypeTag::of::<&'static str>());
	assert_eq!(a.context_type(), TypeTag::of::<Furnace>());

	// Registrations through one handle are visible through the other.
	a.register_fallback(constant("X"));
	assert_eq!(b.fallback_count(), 1);
}

#[test]
fn registry_rejects_type_reuse() {
	let lookups = ItemAttributeLookups::new();
	lookups
		.get::<&'static str, Furnace>(&id("test:fuel"))
		.unwrap();

	let err = lookups.get::<u32, Furnace>(&id("test:fuel")).unwrap_err();
	assert!(matches!(
		err,
		LookupError::TypeConflict { requested_attribute, .. } if requested_attribute.is::<u32>()
	));

	let err = lookups
		.get_named::<u32, Furnace>("Not Valid")
		.unwrap_err();
	assert!(matches!(
		err,
		LookupError::InvalidArgument(InvalidArgument::Identifier(_))
	));
}

#[test]
fn registry_lists_entries() {
	let lookups = ItemAttributeLookups::new();
	assert!(lookups.is_empty());
	lookups.get::<u32, Furnace>(&id("test:heat")).unwrap();
	lookups.get::<Battery, ()>(&id("test:energy")).unwrap();

	let entries = lookups.entries();
	assert_eq!(lookups.len(), 2);
	assert_eq!(entries[0].id(), &id("test:heat"));
	assert!(entries[0].attribute_type().is::<u32>());
	assert!(entries[1].context_type().is::<()>());
}

#[test]
fn queries_run_alongside_registration() {
	let lookup = fuel_lookup();
	let items: Vec<ItemRef> = (0..64).map(|i| block(&format!("test:item_{i}"))).collect();
	lookup.register_fallback(constant("fallback"));

	thread::scope(|s| {
		s.spawn(|| {
			for chunk in items.chunks(8) {
				lookup.register_for_items(constant("keyed"), chunk).unwrap();
			}
		});
		for _ in 0..4 {
			s.spawn(|| {
				for item in &items {
					let found = lookup.find(&ItemStack::of(item), &Furnace);
					assert!(matches!(found, Some("keyed" | "fallback")));
				}
			});
		}
	});

	assert_eq!(lookup.providers().len(), 64);
}
