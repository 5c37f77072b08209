//! The documented class scenarios, runnable end to end.
//!
//! Each scenario builds one class from a descriptor, exercises it and
//! records every step. Expected failures (the invocation guard, an internal
//! name looked up from outside) are recorded as steps, not returned as
//! errors; an `Err` from [`run`] means the scenario itself broke.

use classdown_desugar::{
    ClassDescriptor, ClassLayout, Constructible, DesugarOptions, Desugarer, Function, MemberKey,
    Result, RuntimeError, Scope, Value, reflect,
};
use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// A: constructor plus a method reading a field.
    Greeter,
    /// B: getter/setter pair with a validating setter.
    GuardedName,
    /// C: method key computed by an external function.
    ComputedKey,
    /// D: named class expression referring to itself.
    NamedExpression,
    /// E: calling a class without instantiating it.
    DirectCall,
}

impl Scenario {
    pub const ALL: [Self; 5] = [
        Self::Greeter,
        Self::GuardedName,
        Self::ComputedKey,
        Self::NamedExpression,
        Self::DirectCall,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Greeter => "greeter",
            Self::GuardedName => "guarded-name",
            Self::ComputedKey => "computed-key",
            Self::NamedExpression => "named-expression",
            Self::DirectCall => "direct-call",
        }
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Self::Greeter => "constructor stores a name, DigaOla() returns it",
            Self::GuardedName => "setter ignores names shorter than 4 characters",
            Self::ComputedKey => "method key comes from getMethodName()",
            Self::NamedExpression => "MyClass resolves inside its methods only",
            Self::DirectCall => "calling the class without instantiation fails",
        }
    }
}

/// One recorded action and what came of it.
#[derive(Clone, Debug, Serialize)]
pub struct Step {
    pub action: String,
    pub outcome: String,
    /// `false` when the action raised an error.
    pub ok: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub summary: &'static str,
    pub steps: Vec<Step>,
    pub layout: ClassLayout,
    #[serde(skip)]
    pub class: Constructible,
}

impl ScenarioReport {
    fn new(scenario: Scenario, class: Constructible) -> Self {
        Self {
            scenario,
            summary: scenario.summary(),
            steps: Vec::new(),
            layout: ClassLayout::of(&class),
            class,
        }
    }

    fn record(&mut self, action: impl Into<String>, result: &Result<Value>) {
        let (outcome, ok) = match result {
            Ok(value) => (format!("{value:?}"), true),
            Err(err) => (err.to_string(), false),
        };
        self.steps.push(Step {
            action: action.into(),
            outcome,
            ok,
        });
    }

    /// The outcome of the last step, for callers checking a scenario.
    pub fn last_outcome(&self) -> Option<&str> {
        self.steps.last().map(|step| step.outcome.as_str())
    }
}

pub fn run(scenario: Scenario, options: DesugarOptions) -> Result<ScenarioReport> {
    info!(scenario = scenario.name(), "running scenario");
    let desugarer = Desugarer::new(options);
    match scenario {
        Scenario::Greeter => greeter(&desugarer),
        Scenario::GuardedName => guarded_name(&desugarer),
        Scenario::ComputedKey => computed_key(&desugarer),
        Scenario::NamedExpression => named_expression(&desugarer),
        Scenario::DirectCall => direct_call(&desugarer),
    }
}

fn person_with_greeting() -> ClassDescriptor {
    ClassDescriptor::builder(Some("Person"))
        .constructor(&["name"], |cx| {
            cx.this_set("name", cx.arg(0))?;
            Ok(Value::Undefined)
        })
        .method("DigaOla", |cx| cx.this_get("name"))
        .build()
}

fn greeter(desugarer: &Desugarer) -> Result<ScenarioReport> {
    let class = desugarer.build(person_with_greeting())?;
    let mut report = ScenarioReport::new(Scenario::Greeter, class.clone());

    let john = class.instantiate(&[Value::from("John")])?;
    report.record("new Person(\"John\")", &Ok(john.clone()));
    let greeting = call_method(&john, "DigaOla");
    report.record("john.DigaOla()", &greeting);
    Ok(report)
}

fn guarded_name(desugarer: &Desugarer) -> Result<ScenarioReport> {
    let class = desugarer.build(
        ClassDescriptor::builder(Some("Person"))
            .constructor(&["name"], |cx| {
                cx.this_set("name", cx.arg(0))?;
                Ok(Value::Undefined)
            })
            .getter("name", |cx| cx.this_get("_name"))
            .setter("name", |cx| {
                let value = cx.arg(0);
                if value.as_str().is_some_and(|s| s.chars().count() >= 4) {
                    cx.this_set("_name", value)?;
                }
                Ok(Value::Undefined)
            })
            .build(),
    )?;
    let mut report = ScenarioReport::new(Scenario::GuardedName, class.clone());

    let person = class.instantiate(&[Value::from("John")])?;
    report.record("new Person(\"John\")", &Ok(person.clone()));
    for candidate in ["", "Ana", "Maria"] {
        let write = set_property(&person, "name", Value::from(candidate));
        report.record(format!("person.name = {candidate:?}"), &write);
        let read = get_property(&person, "name");
        report.record("person.name", &read);
    }
    Ok(report)
}

fn computed_key(desugarer: &Desugarer) -> Result<ScenarioReport> {
    let scope = Scope::root();
    scope.declare(
        "getMethodName",
        Function::native("getMethodName", |_| Ok(Value::from("DigaOla"))),
    );
    let class = desugarer.build(
        ClassDescriptor::builder(Some("Person"))
            .in_scope(&scope)
            .constructor(&["name"], |cx| {
                cx.this_set("name", cx.arg(0))?;
                Ok(Value::Undefined)
            })
            .method(
                MemberKey::computed(|cx| {
                    let key_fn = cx.resolve("getMethodName")?;
                    cx.call(&key_fn, &[])
                }),
                |cx| {
                    let name = cx.this_get("name")?;
                    Ok(Value::from(format!("Olá, {name}")))
                },
            )
            .build(),
    )?;
    let mut report = ScenarioReport::new(Scenario::ComputedKey, class.clone());

    let names = reflect::own_property_names(class.method_table()).join(", ");
    report.record(
        "Object.getOwnPropertyNames(Person.prototype)",
        &Ok(Value::from(format!("[{names}]"))),
    );
    let person = class.instantiate(&[Value::from("John")])?;
    report.record("new Person(\"John\")", &Ok(person.clone()));
    report.record("person.DigaOla()", &call_method(&person, "DigaOla"));
    Ok(report)
}

fn named_expression(desugarer: &Desugarer) -> Result<ScenarioReport> {
    let enclosing = Scope::root();
    let class = desugarer.build(
        ClassDescriptor::builder(Some("MyClass"))
            .in_scope(&enclosing)
            .method("whoAmI", |cx| cx.resolve("MyClass"))
            .build(),
    )?;
    // `let Pessoa = class MyClass { ... }`
    enclosing.declare("Pessoa", class.clone());
    let mut report = ScenarioReport::new(Scenario::NamedExpression, class.clone());

    let instance = class.instantiate(&[])?;
    report.record("new Pessoa()", &Ok(instance.clone()));
    let me = call_method(&instance, "whoAmI");
    let same = match &me {
        Ok(value) => Ok(Value::from(value.as_class().is_some_and(|c| c.ptr_eq(&class)))),
        Err(err) => Err(err.clone()),
    };
    report.record("instance.whoAmI()", &me);
    report.record("instance.whoAmI() === Pessoa", &same);
    report.record("MyClass (from the enclosing scope)", &enclosing.resolve("MyClass"));
    Ok(report)
}

fn direct_call(desugarer: &Desugarer) -> Result<ScenarioReport> {
    let class = desugarer.build(person_with_greeting())?;
    let mut report = ScenarioReport::new(Scenario::DirectCall, class.clone());

    report.record("Person(\"John\")", &class.call(&[Value::from("John")]));
    report.record("Person()", &class.call(&[]));
    let john = class.instantiate(&[Value::from("John")]);
    report.record("new Person(\"John\")", &john);
    Ok(report)
}

fn call_method(target: &Value, key: &str) -> Result<Value> {
    match target.as_instance() {
        Some(instance) => instance.invoke(key, &[]),
        None => Err(RuntimeError::type_error(format!(
            "{target:?} has no method {key}"
        ))),
    }
}

fn get_property(target: &Value, key: &str) -> Result<Value> {
    match target.as_instance() {
        Some(instance) => instance.get(key),
        None => Ok(Value::Undefined),
    }
}

fn set_property(target: &Value, key: &str, value: Value) -> Result<Value> {
    match target.as_instance() {
        Some(instance) => instance.set(key, value).map(|()| Value::Undefined),
        None => Err(RuntimeError::type_error(format!(
            "Cannot set property '{key}' of {}",
            target.type_name()
        ))),
    }
}
