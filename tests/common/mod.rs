#![allow(dead_code)]

use cipherforge::{Alphabet, Normalization, Scorer};
use std::sync::Arc;

/// Small English reference corpus. Long enough that the common bigrams
/// (TH, HE, IN, ER, AN) clearly stand out from the smoothing floor.
pub const CORPUS: &str = "\
It was late in the evening when the old ferryman finally reached the other side of the river. \
The water had been rough all afternoon, and the wind that came down from the hills was cold and \
sharp. He tied the boat to the wooden post, pulled his coat around his shoulders and walked up \
the narrow path toward the village. There were lights in some of the windows, and he could hear \
a dog barking somewhere behind the church. When he came to the inn he stopped at the door and \
listened. Inside, the men were talking about the harvest and the weather and the price of grain \
in the market town. Nobody noticed him at first. Then the innkeeper looked up from the counter, \
smiled, and asked him whether he wanted something hot to drink before he went home. \
The ferryman said that he would take a cup of tea and a piece of bread, and he sat down near the \
fire to warm his hands. He had been working on the river for more than thirty years, and in all \
that time he had never seen the current so strong at the end of the summer. The men at the next \
table began to ask him questions. Was it true that the bridge in the north had been washed away? \
Had he seen the merchant who was supposed to arrive with the letters from the capital? He answered \
them as well as he could, but he was tired, and his thoughts kept returning to the strange \
passenger he had carried across that morning. The man had not spoken a single word during the \
whole crossing. He had paid in silver, which was unusual, and he had carried a small leather \
case that he never let out of his sight. When they reached the bank he had thanked the ferryman \
with a nod and disappeared into the trees without looking back. It was only now, sitting by the \
fire and listening to the others, that the ferryman began to wonder where the stranger had been \
going, and why anyone would travel on foot through the forest when the road was so much safer. \
He finished his tea, paid for the bread and the drink, and said good night to everyone in the room. \
Outside the rain had started again, and the street was dark and empty. He walked slowly, thinking \
about the silver coins in his pocket and about the leather case, and he decided that in the \
morning he would tell the whole story to his brother, who always knew what to do in such matters.";

/// Plaintext used by the search tests; written over the standard alphabet.
pub const PLAINTEXT: &str = "\
THE_QUICK_BROWN_FOX_JUMPS_OVER_THE_LAZY_DOG_AND_THEN_RUNS_BACK_INTO_THE_FOREST_WHERE_THE_OTHER_\
ANIMALS_ARE_WAITING_FOR_HIM_NEAR_THE_OLD_RIVER_THAT_FLOWS_DOWN_FROM_THE_HILLS_IN_THE_NORTH";

pub const REVERSED_KEY: &str = "_ZYXWVUTSRQPONMLKJIHGFEDCBA";

pub fn alphabet() -> Alphabet {
    Alphabet::standard()
}

/// Reference corpus reduced to the standard alphabet.
pub fn normalized_corpus() -> String {
    cipherforge::model::loader::normalize_corpus(&alphabet(), CORPUS)
}

pub fn english_scorer() -> Arc<Scorer> {
    english_scorer_with(Normalization::Row)
}

pub fn english_scorer_with(normalization: Normalization) -> Arc<Scorer> {
    let scorer = Scorer::from_corpus(alphabet(), &normalized_corpus(), normalization)
        .expect("corpus model must be valid");
    Arc::new(scorer)
}

/// Deterministic pseudo-random text over the alphabet.
pub fn noise(len: usize, seed: u64) -> String {
    let alphabet = alphabet();
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..len)
        .map(|_| alphabet.symbol(rng.usize(..alphabet.len())))
        .collect()
}
