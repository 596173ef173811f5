use std::marker::PhantomData;

use tracing::debug;

use crate::alias::{self, SharedAliases};
use crate::ontology::termarena::Arena;
use crate::term::internal::GoTermInternal;
use crate::term::TermId;
use crate::{GoError, GoResult, Ontology};

/// Builder state: terms are still being added
pub struct LooseCollection;
/// Builder state: all terms are present, child edges are missing
pub struct AllTerms;
/// Builder state: parent and child edges are complete
pub struct ConnectedTerms;

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        terms: builder.terms,
        aliases: builder.aliases,
        n_inputs: builder.n_inputs,
        state: PhantomData,
    }
}

/// Builds an [`Ontology`] in three steps
///
/// 1. Add all terms with their parent ids ([`Builder::add_term`])
/// 2. Mark the collection as complete ([`Builder::terms_complete`])
/// 3. Derive the child edges ([`Builder::connect_children`]) and
///    [`Builder::build`] the ontology
///
/// # Examples
///
/// ```
/// use goterm::ontology::Builder;
///
/// let mut builder = Builder::new();
/// builder.add_term("GO:0008150", Vec::<&str>::new()).unwrap();
/// builder.add_term("GO:0009987", ["GO:0008150"]).unwrap();
///
/// let ontology = builder.terms_complete().connect_children().build();
///
/// let root = ontology.resolve("GO:0008150").unwrap();
/// assert_eq!(root.child_ids().len(), 1);
/// ```
pub struct Builder<T> {
    terms: Arena,
    aliases: Option<SharedAliases>,
    n_inputs: usize,
    state: PhantomData<T>,
}

impl Default for Builder<LooseCollection> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<LooseCollection> {
    /// Constructs a new, empty builder
    pub fn new() -> Builder<LooseCollection> {
        Self::with_capacity(1)
    }

    /// Constructs a new, empty builder for about `n_terms` terms
    pub fn with_capacity(n_terms: usize) -> Builder<LooseCollection> {
        Builder::<LooseCollection> {
            terms: Arena::with_capacity(n_terms),
            aliases: None,
            n_inputs: 0,
            state: PhantomData,
        }
    }

    /// Attaches an alias resolver that the final [`Ontology`] consults on
    /// lookup misses
    ///
    /// Parent ids that are aliases are linked to their canonical term in
    /// [`Builder::connect_children`].
    #[must_use]
    pub fn aliases(mut self, aliases: SharedAliases) -> Self {
        self.aliases = Some(aliases);
        self
    }

    /// Adds a term and its parent ids
    ///
    /// Parent ids don't need to be present (yet), they are resolved in
    /// [`Builder::connect_children`]. Adding an id a second time replaces
    /// the previous term.
    ///
    /// # Errors
    ///
    /// [`GoError::MalformedTerm`] if the term id or one of the parent ids is empty
    pub fn add_term<S, I, P>(&mut self, id: S, parents: I) -> GoResult<()>
    where
        S: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let index = self.n_inputs;
        self.n_inputs += 1;

        let id = TermId::from(id.into());
        if id.is_empty() {
            return Err(GoError::MalformedTerm { index });
        }
        let mut term = GoTermInternal::new(id);
        for parent in parents {
            let parent = TermId::from(parent.into());
            if parent.is_empty() {
                return Err(GoError::MalformedTerm { index });
            }
            term.add_parent(parent);
        }
        self.terms.insert(term);
        Ok(())
    }

    /// Marks that all terms are added
    #[must_use]
    pub fn terms_complete(self) -> Builder<AllTerms> {
        debug!("Collected {} terms from {} inputs", self.terms.len(), self.n_inputs);
        transition_state(self)
    }
}

impl Builder<AllTerms> {
    /// Adds every term as child to each of its parents
    ///
    /// Parent ids are resolved through the alias resolver, if one is attached.
    /// Parent ids without a matching term are skipped.
    #[must_use]
    pub fn connect_children(mut self) -> Builder<ConnectedTerms> {
        let mut edges: Vec<(TermId, TermId)> = Vec::with_capacity(self.terms.len());
        let mut dangling = 0usize;
        for term in self.terms.iter() {
            for parent in term.parents() {
                let terms = &self.terms;
                if let Some(resolved) =
                    alias::resolve_with(self.aliases.as_ref(), parent.as_str(), move |key| terms.get(key))
                {
                    edges.push((resolved.id().clone(), term.id().clone()));
                } else {
                    debug!("Parent {} of {} does not exist", parent, term.id());
                    dangling += 1;
                }
            }
        }
        for (parent, child) in edges {
            if let Some(parent) = self.terms.get_mut(parent.as_str()) {
                parent.add_child(child);
            }
        }
        debug!("Connected all terms, skipped {} dangling parents", dangling);
        transition_state(self)
    }
}

impl Builder<ConnectedTerms> {
    /// Returns the finished [`Ontology`]
    pub fn build(self) -> Ontology {
        Ontology::new(self.terms, self.aliases)
    }
}
