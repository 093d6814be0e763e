//! Canned assistant replies. Returned verbatim.

use crate::models::Disease;

pub const PREVENTION_TIPS: &str = "To protect your vision and maintain eye health:\n\
1. Eat a balanced diet rich in vitamins A, C, and E.\n\
2. Wear sunglasses that block 99% or more of UVA and UVB radiation.\n\
3. Follow the 20-20-20 rule to reduce digital eye strain: Every 20 minutes, look at something 20 feet away for 20 seconds.\n\
4. Get regular comprehensive eye exams.\n\
5. Don't smoke, as it increases the risk of many eye diseases.";

pub const SMOKING_RISKS: &str = "Smoking significantly increases the risk of several serious eye conditions, including:\n\
1. **Cataracts:** Smokers are at a much higher risk of developing cataracts.\n\
2. **Macular Degeneration (AMD):** Smoking is a major risk factor for AMD, a leading cause of severe vision loss in older adults.\n\
3. **Diabetic Retinopathy:** Smoking can worsen diabetes and accelerate damage to the retina.\n\
4. **Glaucoma:** There is a strong link between smoking and high pressure in the eye, which can lead to glaucoma.\n\
Quitting smoking is one of the best steps you can take to protect your eyesight.";

pub const DISEASE_MENU: &str = "I can provide information on the following conditions: Diabetic Retinopathy, Glaucoma, and Cataracts. \
Which one would you like to know about?";

pub const NO_DR_REASSURANCE: &str = "That's great news! 'No DR' means no signs of diabetic retinopathy were found. \
To keep your eyes healthy, it's important to maintain a healthy lifestyle and continue with regular eye check-ups.";

pub const GREETING: &str = "Hello! How can I assist you with your eye health questions?";

pub const FALLBACK: &str = "I can provide information on Diabetic Retinopathy, Glaucoma, and Cataracts. \
Please ask me about one of these topics, their symptoms, or treatments.";

/// Opening line for a session with no prior scan.
pub const WELCOME: &str = "Hello! I am your AI Eye Care Assistant. How can I help you today? \
Ask me about eye diseases or tips for healthy eyes.";

/// Opening line for a session that follows a scan.
pub fn welcome_after_scan(class_name: &str) -> String {
    format!(
        "Hello! I see your recent scan indicated **{class_name}**. \
         You can ask me more about this condition, or any other questions you have about eye health."
    )
}

/// Which facet of a disease the user asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Symptoms,
    Treatment,
    Overview,
}

/// Reply for a disease and topic. `None` for diseases without a dedicated
/// answer set (macular degeneration).
pub fn disease_reply(disease: Disease, topic: Topic) -> Option<&'static str> {
    let reply = match (disease, topic) {
        (Disease::DiabeticRetinopathy, Topic::Symptoms) => {
            "Symptoms of diabetic retinopathy include blurred vision, floaters, and dark spots. \
             It often has no early symptoms, making regular eye exams crucial for diabetics."
        }
        (Disease::DiabeticRetinopathy, Topic::Treatment) => {
            "Treatments for diabetic retinopathy, which aim to slow progression, include laser therapy, \
             eye injections, and surgery. Managing blood sugar is also vital."
        }
        (Disease::DiabeticRetinopathy, Topic::Overview) => {
            "Diabetic retinopathy is an eye condition affecting blood vessels in the retina, often linked to diabetes. \
             Early detection is key to preventing vision loss."
        }
        (Disease::Glaucoma, Topic::Symptoms) => {
            "Glaucoma often has no early symptoms. In later stages, it can cause gradual loss of peripheral vision. \
             This is why it's called the 'silent thief of sight'."
        }
        (Disease::Glaucoma, Topic::Treatment) => {
            "Glaucoma treatment focuses on lowering eye pressure and may include prescription eye drops, \
             laser therapy, or surgery to prevent further vision loss."
        }
        (Disease::Glaucoma, Topic::Overview) => {
            "Glaucoma is a group of eye conditions that damage the optic nerve, which is vital for good vision. \
             It's often linked to high pressure inside your eye."
        }
        (Disease::Cataracts, Topic::Symptoms) => {
            "Symptoms of cataracts include cloudy or blurry vision, faded colors, glare (especially at night), \
             and poor night vision."
        }
        (Disease::Cataracts, Topic::Treatment) => {
            "The most effective treatment for cataracts is surgery to remove the cloudy lens and replace it \
             with a clear, artificial one. It is a very common and safe procedure."
        }
        (Disease::Cataracts, Topic::Overview) => {
            "A cataract is a clouding of the lens in the eye, which leads to a decrease in vision. \
             It is a common part of aging."
        }
        // TODO: author symptoms/treatment/overview replies for macular degeneration;
        // until then it falls through to the greeting and fallback rules.
        (Disease::MacularDegeneration, _) => return None,
    };
    Some(reply)
}
